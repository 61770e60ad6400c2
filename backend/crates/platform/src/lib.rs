//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id) and composition policy
//! - Identity tokens (HS256 JWT)
//! - Cookie and bearer token transport
//! - Remote media store (Cloudinary, in-memory)
//! - Environment configuration helpers
//! - Cryptographic utilities

pub mod config;
pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod media;
pub mod password;
