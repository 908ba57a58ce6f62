use super::FormatError;
use crate::models::ApiMap;

/// Convert an ApiMap to YAML
pub fn to_yaml(api_map: &ApiMap) -> Result<String, FormatError> {
    serde_yaml::to_string(api_map).map_err(FormatError::from)
}
