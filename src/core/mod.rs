//! Core business logic - framework-agnostic routing and authorization.
//!
//! Nothing in here touches serenity. Platform access goes through the traits
//! in [`message`], [`whitelist`] and [`completion`].

/// Command invocation log records
pub mod command_log;
/// Completion backend interface and invocation
pub mod completion;
/// Response decision engine for inbound messages
pub mod decision;
/// Interaction gate
pub mod gate;
/// Platform-neutral message types and platform traits
pub mod message;
/// Authorization predicates
pub mod policy;
/// Reply-chain resolution and mention stripping
pub mod reply_chain;
/// Execution of response actions
pub mod responder;
/// GPT whitelist store and `/whitelist` handler
pub mod whitelist;
