//! Tests for db::factory and db::repo_config - repository creation and configuration.

mod support;

use std::fs;
use std::str::FromStr;

use section_overlap::algorithms::DetectionStrategy;
use section_overlap::db::factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
use section_overlap::db::{self, DetectionSettings, RepositoryConfig, RepositoryError};

const DETECTION_VARS: [(&str, Option<&str>); 2] = [
    ("OVERLAP_STRATEGY", None),
    ("OVERLAP_SWEEP_THRESHOLD", None),
];

#[test]
fn test_repository_type_from_str() {
    assert_eq!(RepositoryType::from_str("postgres").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("PG").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str(" local ").unwrap(), RepositoryType::Local);

    let err = RepositoryType::from_str("sqlite").unwrap_err();
    assert!(err.contains("Unknown repository type"));
}

#[test]
fn test_repository_type_display_matches_parse() {
    for rt in [RepositoryType::Local, RepositoryType::Postgres] {
        assert_eq!(RepositoryType::from_str(&rt.to_string()).unwrap(), rt);
    }
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/university")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres);
        },
    );
}

#[test]
fn test_repository_type_from_env_invalid_defaults_to_local() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("invalid")),
            ("DATABASE_URL", Some("postgres://localhost/university")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[tokio::test]
async fn test_create_local_via_factory() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(db::health_check(repo.as_ref()).await.unwrap());
}

#[cfg(feature = "postgres-repo")]
#[tokio::test]
async fn test_create_postgres_without_config_fails() {
    let err = RepositoryFactory::create(RepositoryType::Postgres, None)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("requires PostgresConfig"));
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_create_postgres_without_feature_fails() {
    let err = RepositoryFactory::create(RepositoryType::Postgres, None)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("feature not enabled"));
}

#[tokio::test]
async fn test_builder_seeds_local_catalog() {
    let repo = RepositoryBuilder::new()
        .repository_type(RepositoryType::Local)
        .catalog(support::university_catalog())
        .build()
        .await
        .unwrap();

    let intervals = db::load_intervals(repo.as_ref()).await.unwrap();
    assert_eq!(intervals.len(), 9);
}

#[test]
fn test_builder_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    fs::write(
        &path,
        r#"
[repository]
type = "local"

[detection]
strategy = "sweep_line"
sweep_threshold = 8
"#,
    )
    .unwrap();

    support::with_scoped_env(&DETECTION_VARS, || {
        let builder = RepositoryBuilder::new().from_config_file(&path).unwrap();
        assert_eq!(builder.selected_type(), RepositoryType::Local);

        let options = builder.detection_options().unwrap();
        assert_eq!(options.strategy, DetectionStrategy::SweepLine);
        assert_eq!(options.sweep_threshold, 8);
    });
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RepositoryBuilder::new()
        .from_config_file(dir.path().join("absent.toml"))
        .err()
        .unwrap();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_invalid_repository_type_in_config() {
    let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"mysql\"\n").unwrap();
    let err = RepositoryBuilder::new().apply_config(&config).err().unwrap();
    assert!(err.to_string().contains("Invalid repository type"));
}

#[test]
fn test_detection_section_defaults_when_absent() {
    let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"local\"\n").unwrap();
    assert_eq!(config.detection, DetectionSettings::default());
    assert_eq!(config.detection.strategy, DetectionStrategy::Auto);
}

#[test]
fn test_detection_env_overrides() {
    support::with_scoped_env(
        &[
            ("OVERLAP_STRATEGY", Some("pairwise")),
            ("OVERLAP_SWEEP_THRESHOLD", Some(" 16 ")),
        ],
        || {
            let options = DetectionSettings::default()
                .with_env_overrides()
                .unwrap()
                .to_options();
            assert_eq!(options.strategy, DetectionStrategy::Pairwise);
            assert_eq!(options.sweep_threshold, 16);
        },
    );
}

#[test]
fn test_detection_env_override_rejects_garbage() {
    support::with_scoped_env(
        &[
            ("OVERLAP_STRATEGY", Some("quadratic")),
            ("OVERLAP_SWEEP_THRESHOLD", None),
        ],
        || {
            let err = DetectionSettings::default().with_env_overrides().unwrap_err();
            assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        },
    );

    support::with_scoped_env(
        &[
            ("OVERLAP_STRATEGY", None),
            ("OVERLAP_SWEEP_THRESHOLD", Some("many")),
        ],
        || {
            let err = DetectionSettings::default().with_env_overrides().unwrap_err();
            assert!(err.to_string().contains("OVERLAP_SWEEP_THRESHOLD"));
        },
    );
}

#[cfg(feature = "postgres-repo")]
#[test]
fn test_explicit_postgres_ignores_repository_type_env() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/university")),
        ],
        || {
            let plain = RepositoryBuilder::new().from_env().unwrap();
            assert_eq!(plain.selected_type(), RepositoryType::Local);

            let explicit = RepositoryBuilder::new().postgres_from_env().unwrap();
            assert_eq!(explicit.selected_type(), RepositoryType::Postgres);
        },
    );
}

#[cfg(feature = "postgres-repo")]
#[test]
fn test_explicit_postgres_without_url_is_configuration_error() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || {
            let err = RepositoryBuilder::new().postgres_from_env().err().unwrap();
            assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
            assert!(err.to_string().contains("DATABASE_URL"));
        },
    );
}

#[cfg(not(feature = "postgres-repo"))]
#[test]
fn test_explicit_postgres_without_feature_fails() {
    let err = RepositoryBuilder::new().postgres_from_env().err().unwrap();
    assert!(err.to_string().contains("feature not enabled"));
}
