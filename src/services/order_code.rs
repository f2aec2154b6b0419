use crate::{
    entities::order::{self, Entity as Order},
    errors::ServiceError,
};
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// Human-facing order codes: 6 characters from an unambiguous-enough
/// uppercase alphanumeric alphabet, ~2.2 billion combinations.
const CODE_LEN: usize = 6;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Collision retries are bounded; running out means the code space is
/// effectively saturated and somebody needs to know, not spin forever.
const MAX_ATTEMPTS: u32 = 32;

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Generates an order code that is unique among persisted orders, retrying
/// on collision up to [`MAX_ATTEMPTS`] times.
pub async fn generate<C: ConnectionTrait>(conn: &C) -> Result<String, ServiceError> {
    for _ in 0..MAX_ATTEMPTS {
        let code = random_code();
        let exists = Order::find()
            .filter(order::Column::OrderCode.eq(code.as_str()))
            .one(conn)
            .await?
            .is_some();
        if !exists {
            return Ok(code);
        }
    }

    Err(ServiceError::InternalError(format!(
        "Could not generate a unique order code after {} attempts",
        MAX_ATTEMPTS
    )))
}
