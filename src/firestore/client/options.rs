#[derive(Clone, Debug)]
pub struct FirestoreClientOptions {
    pub host_url: String,
    pub database_id: String,
}

impl Default for FirestoreClientOptions {
    fn default() -> Self {
        Self {
            host_url: "https://firestore.googleapis.com".to_string(),
            database_id: "(default)".to_string(),
        }
    }
}

impl FirestoreClientOptions {
    pub fn host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = host_url.into();
        self
    }

    pub fn database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Points the client at a local emulator, e.g. `127.0.0.1:8080`. The
    /// emulator only speaks plain HTTP/2, so any scheme given is replaced.
    pub fn emulator(self, host: &str) -> Self {
        let host = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .unwrap_or(host);
        self.host_url(format!("http://{host}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emulator_uses_plain_http() {
        let options = FirestoreClientOptions::default().emulator("127.0.0.1:8080");
        assert_eq!(options.host_url, "http://127.0.0.1:8080");

        let options = FirestoreClientOptions::default().emulator("http://localhost:8081");
        assert_eq!(options.host_url, "http://localhost:8081");
        assert_eq!(options.database_id, "(default)");
    }

    #[test]
    fn emulator_replaces_a_tls_scheme() {
        let options = FirestoreClientOptions::default().emulator("https://localhost:8080");
        assert_eq!(options.host_url, "http://localhost:8080");
    }
}
