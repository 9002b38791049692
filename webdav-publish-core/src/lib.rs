#![doc = "webdav-publish-core: artifact resolution and upload pipeline for WebDAV artifact stores."]

//! This crate holds the publish pipeline and its data model. Transport (the
//! reqwest client), configuration loading and command dispatch live in the
//! `webdav-publish` crate.
//!
//! # Usage
//! Build a [`publish::PublishRequest`], pick a [`contract::WebDavClient`] and a
//! [`contract::Console`], and call [`publish::publish`].

pub mod config;
pub mod console;
pub mod contract;
pub mod ensure;
pub mod error;
pub mod publish;
pub mod remote_path;
pub mod resolve;
pub mod uploader;

pub use error::{EnsureError, PublishError, PublishFailure, ResolutionError, UploadError};
pub use publish::{publish, PublishMetadata, PublishReport, PublishRequest};
