use serde::{Deserialize, Serialize};

/// Claims of the access tokens this service accepts. Tokens are issued by the
/// account service; `document` and `user_type` mirror the user record there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    /// Business document of the account (cédula / tarjeta de identidad).
    pub document: String,
    /// `APRENDIZ`, `INSTRUCTOR`, or any other account type.
    pub user_type: String,
    pub exp: usize,
}
