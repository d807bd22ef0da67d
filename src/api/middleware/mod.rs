//! API middleware. Only request logging; CORS comes from `tower-http`.

pub mod audit;
