#[cfg(test)]
mod test {

    use crate::config::loader::load_config;
    use crate::config::settings::ResponseShape;
    use crate::directory::HomeroomDirectory;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn directory_loads_from_json_file() {
        let file = write_temp(r#"{ "301": ["1001", "1003", "1002"], "101": ["2001"] }"#);
        let directory = HomeroomDirectory::from_file(file.path()).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.names(), vec!["101", "301"]);
        // district-ID order comes from the file, not sorted
        assert_eq!(
            directory.lookup("301").unwrap(),
            ["1001", "1003", "1002"]
        );
        assert!(directory.lookup("999").is_none());
    }

    #[test]
    fn malformed_directory_file_is_an_error() {
        let file = write_temp("not json at all");
        assert!(HomeroomDirectory::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_directory_file_is_an_error() {
        assert!(HomeroomDirectory::from_file("/nonexistent/homerooms.json").is_err());
    }

    #[test]
    fn config_loads_with_defaults() {
        let file = write_temp(
            r#"
server:
  host: 127.0.0.1
  port: "8080"
upstream:
  base_url: https://library.example.com/api/v1/rest/context/destiny
directory:
  inline:
    "301": ["1001"]
"#,
        );
        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg.upstream.timeout_seconds, 10);
        assert_eq!(cfg.upstream.client_id_env, "CLIENT_ID");
        assert_eq!(cfg.response_shape, ResponseShape::Allowance);

        let directory = HomeroomDirectory::from_config(&cfg.directory).unwrap();
        assert_eq!(directory.lookup("301").unwrap(), ["1001"]);
    }

    #[test]
    fn config_rejects_missing_directory_source() {
        let file = write_temp(
            r#"
server:
  host: 127.0.0.1
  port: "8080"
upstream:
  base_url: https://library.example.com
directory: {}
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn config_rejects_two_directory_sources() {
        let file = write_temp(
            r#"
server:
  host: 127.0.0.1
  port: "8080"
upstream:
  base_url: https://library.example.com
directory:
  path: homerooms.json
  inline:
    "301": ["1001"]
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn config_selects_passthrough_shape() {
        let file = write_temp(
            r#"
server:
  host: 127.0.0.1
  port: "8080"
upstream:
  base_url: https://library.example.com
directory:
  inline: {}
response_shape: passthrough
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.response_shape, ResponseShape::Passthrough);
    }

    #[test]
    #[serial]
    fn credentials_come_from_the_environment() {
        let file = write_temp(
            r#"
server:
  host: 127.0.0.1
  port: "8080"
upstream:
  base_url: https://library.example.com
  client_id_env: TEST_DESTINY_ID
  client_secret_env: TEST_DESTINY_SECRET
directory:
  inline: {}
"#,
        );
        let cfg = load_config(file.path()).unwrap();

        std::env::remove_var("TEST_DESTINY_ID");
        std::env::remove_var("TEST_DESTINY_SECRET");
        assert!(cfg.upstream.credentials().is_err());

        std::env::set_var("TEST_DESTINY_ID", "id-1");
        std::env::set_var("TEST_DESTINY_SECRET", "secret-1");
        let (id, secret) = cfg.upstream.credentials().unwrap();
        assert_eq!(id, "id-1");
        assert_eq!(secret, "secret-1");

        std::env::remove_var("TEST_DESTINY_ID");
        std::env::remove_var("TEST_DESTINY_SECRET");
    }
}
