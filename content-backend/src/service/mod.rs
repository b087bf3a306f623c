// content-backend/src/service/mod.rs

pub mod entitlement_service;
pub mod feed_service;
pub mod payment_service;
pub mod tier_upgrade_service;
pub mod upgrade_workflow;
