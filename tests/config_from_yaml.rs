use std::io::Write;

use crawldump::config::CrawlConfig;

#[test]
fn test_partial_yaml_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "dsn: mysql://backup@db.internal:3306/shop").unwrap();
    writeln!(file, "start_table: orders").unwrap();

    let config = CrawlConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.dsn, "mysql://backup@db.internal:3306/shop");
    assert_eq!(config.start_table, "orders");
    // Keys not present in the file keep their defaults.
    assert_eq!(config.backup_file, "snapshot.sql");
    assert_eq!(config.script_file, "mysqldump_snapshot.sh");
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "start_table: [nested, list]").unwrap();

    assert!(CrawlConfig::from_yaml_file(file.path()).is_err());
}

#[test]
fn test_yaml_with_empty_field_fails_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "start_table: \"\"").unwrap();

    assert!(CrawlConfig::from_yaml_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(CrawlConfig::from_yaml_file("/nonexistent/crawldump.yaml").is_err());
}
