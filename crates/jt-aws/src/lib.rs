//! AWS implementation of the platform traits: EC2 for network lookups, ECS
//! for the task lifecycle and CloudWatch Logs for the task's log stream.
mod classify;
pub use classify::classify_code;

mod client;
pub use client::AwsPlatform;

mod convert;
mod ec2;
mod ecs;
mod logs;
