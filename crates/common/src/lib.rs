//! Cross-cutting helpers shared by the server crate and the binaries.

pub mod types;

pub mod utils {
    pub mod logging;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_as_msg() {
        let m = types::Message::new("Job removed");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!({"msg": "Job removed"}));
    }
}
