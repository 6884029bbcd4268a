use actix_web::{
  get,
  http::header::{self, ContentType},
  web, HttpRequest, HttpResponse, Responder,
};
use askama::Template;

use crate::db::TodoStore;
use crate::error::AppError;
use crate::model::{FieldErrors, FormKind, TodoForm};
use crate::templates::{ConfirmDeletePage, TodoFormPage, TodoListPage};

#[get("/health")]
pub async fn health() -> impl Responder {
  HttpResponse::Ok().content_type(ContentType::plaintext()).body("OK")
}

fn render<T: Template>(page: T) -> Result<HttpResponse, AppError> {
  let body = page.render()?;
  Ok(
    HttpResponse::Ok()
      .content_type(ContentType::html())
      .body(body),
  )
}

fn redirect_to_list() -> HttpResponse {
  HttpResponse::Found()
    .append_header((header::LOCATION, "/"))
    .finish()
}

pub async fn list(store: web::Data<TodoStore>) -> Result<HttpResponse, AppError> {
  let todos = web::block(move || store.list()).await??;
  render(TodoListPage::new(todos))
}

pub async fn create_form() -> Result<HttpResponse, AppError> {
  render(TodoFormPage::create(
    TodoForm::default(),
    FieldErrors::default(),
  ))
}

pub async fn create(
  store: web::Data<TodoStore>,
  form: web::Form<TodoForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  let input = match form.validate(FormKind::Create) {
    Ok(input) => input,
    Err(errors) => return render(TodoFormPage::create(form, errors)),
  };
  let todo = web::block(move || store.create(&input)).await??;
  tracing::info!(id = todo.id, title = %todo.title, "created todo");
  Ok(redirect_to_list())
}

pub async fn edit_form(
  store: web::Data<TodoStore>,
  id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = id.into_inner();
  let todo = web::block(move || store.get(id)).await??;
  render(TodoFormPage::edit(
    id,
    TodoForm::from(&todo),
    FieldErrors::default(),
  ))
}

/// The form extractor's failure is held back until the id is known to exist,
/// so a missing todo answers 404 whatever the body looks like.
pub async fn edit(
  store: web::Data<TodoStore>,
  id: web::Path<i64>,
  form: Result<web::Form<TodoForm>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
  let id = id.into_inner();
  let lookup = store.clone();
  web::block(move || lookup.get(id)).await??;

  let form = match form {
    Ok(form) => form.into_inner(),
    Err(e) => return Ok(e.error_response()),
  };
  let input = match form.validate(FormKind::Edit) {
    Ok(input) => input,
    Err(errors) => return render(TodoFormPage::edit(id, form, errors)),
  };
  let todo = web::block(move || store.update(id, &input)).await??;
  tracing::info!(id = todo.id, resolved = todo.resolved, "updated todo");
  Ok(redirect_to_list())
}

pub async fn toggle(
  store: web::Data<TodoStore>,
  id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = id.into_inner();
  let todo = web::block(move || store.toggle_resolved(id)).await??;
  tracing::info!(id, resolved = todo.resolved, "toggled todo");
  Ok(redirect_to_list())
}

pub async fn delete_form(
  store: web::Data<TodoStore>,
  id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = id.into_inner();
  let todo = web::block(move || store.get(id)).await??;
  render(ConfirmDeletePage { todo })
}

pub async fn delete(
  store: web::Data<TodoStore>,
  id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = id.into_inner();
  web::block(move || store.delete(id)).await??;
  tracing::info!(id, "deleted todo");
  Ok(redirect_to_list())
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
  Err(AppError::NoRoute(req.path().to_string()))
}
