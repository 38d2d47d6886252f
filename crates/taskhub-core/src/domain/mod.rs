//! 태스크 관리 도메인 모델.

mod project;
mod role;
mod task;
mod user;

pub use project::*;
pub use role::*;
pub use task::*;
pub use user::*;
