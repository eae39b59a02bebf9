use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    /// Postgres URL. Without one, appointments are kept in memory only.
    fn database_url(&self) -> Option<String>;
    /// Directory with static assets served outside of `/api`.
    fn public_dir(&self) -> Option<PathBuf>;
}
