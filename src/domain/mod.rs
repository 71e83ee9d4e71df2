// Domain layer - Labels, derived intervals and player shifts

pub mod model;
