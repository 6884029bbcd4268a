use askama::Template;
use chrono::prelude::{NaiveDate, Utc};

use crate::model::{FieldErrors, Todo, TodoForm};

#[derive(Template)]
#[template(path = "todo_list.html")]
pub struct TodoListPage {
  pub todos: Vec<Todo>,
  pub today: NaiveDate,
}

impl TodoListPage {
  pub fn new(todos: Vec<Todo>) -> Self {
    TodoListPage {
      todos,
      today: Utc::now().date_naive(),
    }
  }

  pub fn open_count(&self) -> usize {
    self.todos.iter().filter(|t| !t.resolved).count()
  }
}

#[derive(Template)]
#[template(path = "todo_form.html")]
pub struct TodoFormPage {
  pub heading: String,
  pub action: String,
  pub submit_label: &'static str,
  pub form: TodoForm,
  pub errors: FieldErrors,
  pub show_resolved: bool,
}

impl TodoFormPage {
  pub fn create(form: TodoForm, errors: FieldErrors) -> Self {
    TodoFormPage {
      heading: "New todo".to_string(),
      action: "/create".to_string(),
      submit_label: "Create",
      form,
      errors,
      show_resolved: false,
    }
  }

  pub fn edit(id: i64, form: TodoForm, errors: FieldErrors) -> Self {
    TodoFormPage {
      heading: format!("Edit todo #{}", id),
      action: format!("/edit/{}", id),
      submit_label: "Save",
      form,
      errors,
      show_resolved: true,
    }
  }
}

#[derive(Template)]
#[template(path = "todo_confirm_delete.html")]
pub struct ConfirmDeletePage {
  pub todo: Todo,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
  pub status: u16,
  pub reason: &'static str,
  pub message: String,
}
