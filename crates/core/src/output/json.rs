use super::FormatError;
use crate::models::ApiMap;

/// Convert an ApiMap to pretty-printed JSON
pub fn to_json(api_map: &ApiMap) -> Result<String, FormatError> {
    serde_json::to_string_pretty(api_map).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractMetadata;

    #[test]
    fn test_to_json() {
        let api_map = ApiMap::new(vec![], ExtractMetadata::default());

        let json = to_json(&api_map).unwrap();
        assert!(json.contains("\"files\""));
        assert!(json.contains("\"stats\""));
        assert!(json.contains("\"metadata\""));
    }
}
