pub mod masking;
pub mod permission_guard;

pub use masking::mask_value;
pub use permission_guard::{PermissionGuard, PermissionStatus, SECURE_FILE_MODE, restrict_to_owner};
