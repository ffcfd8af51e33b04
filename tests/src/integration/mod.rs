//! Cross-crate integration tests.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod flows;
#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod telemetry;
