// Two tiers: public (no identity required) and protected (identity
// middleware applied; individual handlers decide whether a user is required).
pub mod protected;
pub mod public;
