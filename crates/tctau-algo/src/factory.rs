//! Algorithm selection by name

use tctau_core::{ParameterSet, TauError, TauResult};
use tracing::debug;

use crate::{ParametrizedAlgorithm, TauAlgorithm, TcTauAlgorithm};

/// Algorithm used when `Algorithm` is absent
pub const DEFAULT_ALGORITHM: &str = "TCTau";

/// Algorithm selected by a parameter set
pub fn algorithm_name(params: &ParameterSet) -> TauResult<&str> {
    Ok(params.get_string_or("Algorithm", DEFAULT_ALGORITHM)?)
}

/// Build the algorithm named by the `Algorithm` parameter
pub fn build_algorithm(params: &ParameterSet) -> TauResult<Box<dyn TauAlgorithm>> {
    let name = algorithm_name(params)?;
    let algo: Box<dyn TauAlgorithm> = match name {
        "TCTau" => Box::new(TcTauAlgorithm::new(params)?),
        "Parametrized" => Box::new(ParametrizedAlgorithm::new(params)?),
        other => return Err(TauError::UnknownAlgorithm(other.to_string())),
    };
    debug!(algorithm = algo.name(), "tau algorithm built");
    Ok(algo)
}
