//! Use-case services exposed to collaborator layers.

pub mod quiz_service;
