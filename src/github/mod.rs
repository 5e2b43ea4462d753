//! GitHub integration for release operations

mod client;
mod release_manager;
mod uploader;

pub use client::{
    Asset, CreateReleaseRequest, GitHubClient, Release, ReleaseApi, asset_upload_url,
};
pub use release_manager::{ReleaseRegistry, ReleaseTarget};
pub use uploader::{AssetUploader, UploadReport};
