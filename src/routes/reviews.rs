use actix_web::http::{Uri, header};
use actix_web::{HttpRequest, Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::api::http::HttpBackend;
use crate::forms::review::ReviewForm;
use crate::models::visitor::Visitor;
use crate::routes::redirect;
use crate::services::{ServiceError, reviews as reviews_service};

/// Page the review form was posted from. Only the path is kept so the
/// redirect stays on this site.
fn back_to(req: &HttpRequest) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|path| path.to_string()))
        .filter(|path| path.starts_with('/'))
        .unwrap_or_else(|| "/products".to_string())
}

#[post("/review")]
pub async fn submit_review(
    req: HttpRequest,
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match reviews_service::submit_review(&repo, &visitor.tokens, form).await {
        Ok(()) => {
            FlashMessage::success("Thank you for your review!").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::warning("Sign in to leave a review.").send();
            return redirect("/login");
        }
        Err(ServiceError::Validation(errors)) => {
            FlashMessage::warning(errors.first_message().unwrap_or_default()).send();
        }
        Err(err) => {
            log::warn!("Review was not saved: {err}");
            FlashMessage::error(err.user_message()).send();
        }
    }
    redirect(&back_to(&req))
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn returns_to_referring_page() {
        let req = TestRequest::default()
            .insert_header((header::REFERER, "https://shop.example/settings/order/7?tab=items"))
            .to_http_request();
        assert_eq!(back_to(&req), "/settings/order/7?tab=items");

        let req = TestRequest::default().to_http_request();
        assert_eq!(back_to(&req), "/products");
    }
}
