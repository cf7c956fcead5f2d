pub use {anyhow, csv, itertools, log, pretty_env_logger, rayon, serde, serde_json};
