pub const DEFAULT_ADMIN_ROLE: &str = "Admin";
pub const DEFAULT_INTEREST_OPERATOR: &str = "InterestOperator";
/// 20 %
pub const DEFAULT_INTEREST_RATE_BPS: u32 = 2_000;

/// Settings shared by the engine's collaborators
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// The role name granting unrestricted access
    pub admin_role: String,
    /// The interest rate in basis points (1/100 of a percent)
    pub interest_rate_bps: u32,
    /// The name of the user the interest operator acts as
    pub interest_operator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            admin_role: String::from(DEFAULT_ADMIN_ROLE),
            interest_rate_bps: DEFAULT_INTEREST_RATE_BPS,
            interest_operator: String::from(DEFAULT_INTEREST_OPERATOR),
        }
    }
}
