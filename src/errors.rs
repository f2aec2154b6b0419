use serde::Serialize;

/// Error type shared by every service in the engine.
///
/// Fatal variants abort the enclosing transaction; the caller observes the
/// data model exactly as it was before the request.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Product with SKU {0} not found")]
    SkuNotFound(String),

    #[error("Insufficient stock for {product} ({variant}). Only {available} available, but {requested} requested.")]
    InsufficientStock {
        product: String,
        variant: String,
        available: i32,
        requested: i32,
    },

    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),

    #[error("Return not allowed: {0}")]
    ReturnNotAllowed(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Machine-readable code surfaced alongside the human-readable message.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::DatabaseError(_) => "database_error",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::ValidationError(_) => "validation_error",
            ServiceError::SkuNotFound(_) => "sku_not_found",
            ServiceError::InsufficientStock { .. } => "insufficient_stock",
            ServiceError::InvalidPromoCode(_) => "invalid_promo_code",
            ServiceError::ReturnNotAllowed(_) => "return_not_allowed",
            ServiceError::InvalidOperation(_) => "invalid_operation",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::InternalError(_) => "internal_error",
        }
    }

    pub fn db_error(err: sea_orm::error::DbErr) -> Self {
        ServiceError::DatabaseError(err)
    }
}
