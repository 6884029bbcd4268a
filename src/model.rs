use chrono::prelude::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::Deserialize;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Enter a valid date.";

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
  pub id: i64,
  pub title: String,
  pub description: String,
  pub due_date: Option<NaiveDate>,
  pub resolved: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Todo {
  /// Maps a row selected with [`crate::db::TODO_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Todo {
      id: row.get(0)?,
      title: row.get(1)?,
      description: row.get(2)?,
      due_date: row.get(3)?,
      resolved: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn due_label(&self) -> String {
    self
      .due_date
      .map(|d| d.format(DATE_FORMAT).to_string())
      .unwrap_or_default()
  }

  pub fn is_overdue(&self, today: &NaiveDate) -> bool {
    !self.resolved && self.due_date.map_or(false, |d| d < *today)
  }

  pub fn created_label(&self) -> String {
    self.created_at.format("%Y-%m-%d %H:%M").to_string()
  }
}

/// Validated field values ready to be written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoInput {
  pub title: String,
  pub description: String,
  pub due_date: Option<NaiveDate>,
  /// `None` leaves the stored flag untouched.
  pub resolved: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
  Create,
  Edit,
}

/// Raw form submission. Every field is kept as text so that an invalid
/// submission can be echoed back to the user unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TodoForm {
  pub title: String,
  pub description: String,
  pub due_date: String,
  pub resolved: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
  pub title: Option<String>,
  pub due_date: Option<String>,
}

impl FieldErrors {
  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.due_date.is_none()
  }
}

impl From<&Todo> for TodoForm {
  fn from(todo: &Todo) -> Self {
    TodoForm {
      title: todo.title.clone(),
      description: todo.description.clone(),
      due_date: todo.due_label(),
      resolved: todo.resolved.then(|| "on".to_string()),
    }
  }
}

impl TodoForm {
  pub fn is_checked(&self) -> bool {
    self.resolved.as_deref().map_or(false, checkbox_value)
  }

  pub fn validate(&self, kind: FormKind) -> Result<TodoInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = self.title.trim();
    let title_len = title.chars().count();
    if title.is_empty() {
      errors.title = Some(REQUIRED.to_string());
    } else if title_len > TITLE_MAX_CHARS {
      errors.title = Some(format!(
        "Ensure this value has at most {} characters (it has {}).",
        TITLE_MAX_CHARS, title_len
      ));
    }

    let due_date = match self.due_date.trim() {
      "" => None,
      raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
          errors.due_date = Some(INVALID_DATE.to_string());
          None
        }
      },
    };

    if !errors.is_empty() {
      return Err(errors);
    }

    let resolved = match kind {
      FormKind::Create => None,
      // browsers omit unchecked boxes entirely
      FormKind::Edit => Some(self.is_checked()),
    };

    Ok(TodoInput {
      title: title.to_string(),
      description: self.description.trim().to_string(),
      due_date,
      resolved,
    })
  }
}

fn checkbox_value(raw: &str) -> bool {
  !matches!(raw.trim(), "" | "0" | "false" | "False" | "off")
}
