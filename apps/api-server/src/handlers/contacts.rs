//! Contact inbox handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Contact;
use quill_shared::MessageResponse;
use quill_shared::dto::{ContactRequest, ContactResponse, ReplyRequest, ReplyResponse, UpdateContactRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn contact_not_found() -> AppError {
    AppError::NotFound("Contact not found".to_string())
}

/// POST /api/contacts - public.
///
/// The acknowledgement email is awaited deliberately: a transport failure
/// fails the submission, and `autoResponseSent` only flips to true after
/// the provider accepted the mail.
pub async fn submit_contact(
    state: web::Data<AppState>,
    body: web::Json<ContactRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if [&req.name, &req.email, &req.subject, &req.message]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let mut contact = state
        .contacts
        .save(Contact::new(req.name, req.email, req.subject, req.message))
        .await?;

    let html = format!(
        "<p>Hello {},</p><p>Thank you for reaching out. We will get back to you soon!</p>",
        contact.name
    );
    state
        .mailer
        .send(
            &contact.email,
            &format!("Thank you for contacting us: {}", contact.subject),
            &html,
        )
        .await?;

    contact.auto_response_sent = true;
    contact.touch();
    let contact = state.contacts.save(contact).await?;

    Ok(HttpResponse::Created().json(ContactResponse::from(contact)))
}

/// GET /api/contacts - administrator only.
pub async fn list_contacts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let contacts: Vec<ContactResponse> = state
        .contacts
        .find_all()
        .await?
        .into_iter()
        .map(ContactResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(contacts))
}

/// GET /api/contacts/{id} - administrator only.
pub async fn get_contact(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let contact = state
        .contacts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(contact_not_found)?;
    Ok(HttpResponse::Ok().json(ContactResponse::from(contact)))
}

/// POST /api/contacts/{id}/reply - administrator only. Emails the reply to
/// the submitter, then stores it and flips the status to responded.
pub async fn reply_contact(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ReplyRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let reply = body.into_inner().admin_reply;
    if reply.trim().is_empty() {
        return Err(AppError::BadRequest("Reply message required".to_string()));
    }

    let mut contact = state
        .contacts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(contact_not_found)?;

    let html = format!("<p>Hello {},</p><p>{reply}</p>", contact.name);
    state
        .mailer
        .send(
            &contact.email,
            &format!("Response to your message: {}", contact.subject),
            &html,
        )
        .await?;

    contact.record_reply(reply);
    let contact = state.contacts.save(contact).await?;

    Ok(HttpResponse::Ok().json(ReplyResponse {
        message: "Reply sent and saved successfully".to_string(),
        contact: ContactResponse::from(contact),
    }))
}

/// PUT /api/contacts/{id} - administrator only, partial update.
pub async fn update_contact(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContactRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let req = body.into_inner();

    let mut contact = state
        .contacts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(contact_not_found)?;

    if let Some(name) = req.name {
        contact.name = name;
    }
    if let Some(email) = req.email {
        contact.email = email;
    }
    if let Some(subject) = req.subject {
        contact.subject = subject;
    }
    if let Some(message) = req.message {
        contact.message = message;
    }
    if let Some(status) = req.status {
        contact.status = status;
    }
    if let Some(admin_reply) = req.admin_reply {
        contact.admin_reply = Some(admin_reply);
    }
    contact.touch();

    let contact = state.contacts.save(contact).await?;
    Ok(HttpResponse::Ok().json(ContactResponse::from(contact)))
}

/// DELETE /api/contacts/{id} - administrator only.
pub async fn delete_contact(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let id = path.into_inner();
    state
        .contacts
        .find_by_id(id)
        .await?
        .ok_or_else(contact_not_found)?;

    state.contacts.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Contact deleted successfully")))
}

/// DELETE /api/contacts - administrator only.
pub async fn delete_all_contacts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let count = state.contacts.delete_all().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "All contacts deleted ({count})"
    ))))
}
