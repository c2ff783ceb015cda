use fetch_coordinator::Position;

/// Wiring defects detected by the data source helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("no object at {0}")]
    MissingObject(Position),
    #[error("{0} is outside the list; only section 0 is supported")]
    OutsideList(Position),
    #[error("supplementary view requested without a supplementary configurator")]
    NoSupplementaryConfigurator,
}
