//! HTTP-facing guards applied before requests reach downstream handlers.

pub mod admission;
