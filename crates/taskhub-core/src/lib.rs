//! # TaskHub Core
//!
//! 태스크 관리 서비스의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 사용자 자격증명, 역할 및 권한
//! - 태스크와 상태 전이 규칙에 필요한 상태 정의
//! - 프로젝트와 공지사항
//! - 도메인 에러 분류
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
