//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a fundraising appeal.
pub type AppealId = DatabaseId;

/// The ID of a fund. Every fund belongs to at most one appeal.
pub type FundId = DatabaseId;

/// The ID of a donation transaction.
pub type DonationId = DatabaseId;
