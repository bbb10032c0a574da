use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::user::list_users,
        api::user::create_user,
        api::user::get_user,
        api::user::get_user_copies,
        api::user::get_outgoing_requests,
        api::user::get_incoming_requests,
        api::books::list_books,
        api::books::create_book,
        api::books::get_book,
        api::copy::list_copies,
        api::copy::create_copy,
        api::copy::get_copy,
        api::requests::create_request,
        api::requests::list_requests,
        api::requests::get_request,
        api::requests::accept_request,
        api::requests::confirm_delivery,
        api::requests::cancel_request,
        api::messages::post_message,
        api::messages::list_messages,
    ),
    components(
        schemas(
            api::requests::CreateRequestPayload,
            api::messages::PostMessagePayload,
            api::copy::CreateCopyRequest,
            crate::domain::CreateUserInput,
            crate::domain::CreateBookInput,
            crate::domain::User,
            crate::domain::Book,
            crate::domain::Copy,
            crate::models::BookCondition,
            crate::models::CopyStatus,
            crate::models::RequestStatus,
            crate::services::RequestWithDetails,
        )
    ),
    tags(
        (name = "noshelf", description = "NoShelf lending API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_lifecycle_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/requests/{id}/accept"));
        assert!(doc.paths.paths.contains_key("/api/requests/{id}/confirm"));
        assert!(doc.paths.paths.contains_key("/api/requests/{id}/messages"));
    }

    #[test]
    fn test_openapi_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/users",
            "/api/users/{id}",
            "/api/users/{id}/copies",
            "/api/users/{id}/requests/outgoing",
            "/api/users/{id}/requests/incoming",
            "/api/books",
            "/api/books/{id}",
            "/api/copies",
            "/api/copies/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
