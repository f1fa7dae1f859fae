//! Product Errors

use karat::material::MaterialError;
use karat_app::domain::products::ProductsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("A product with this slug already exists")
        }
        ProductsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced diamond type does not exist")
        }
        ProductsServiceError::MissingRequiredData | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::Sql(source) => {
            error!("products storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// A material the request could not describe.
pub(crate) fn material_error(error: &MaterialError) -> StatusError {
    StatusError::bad_request().brief(error.to_string())
}
