//! Geocoding stage: block addresses to coordinates.

use futures::stream::{self, StreamExt};
use litter_core::{Coordinates, Error, Result};
use litter_geocode::{GeocodeResult, Geocoder};

use crate::blocks::LitterBlock;
use crate::config::PipelineConfig;

/// A block together with its geocoding outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedBlock {
    /// The input row.
    pub block: LitterBlock,
    /// Address sent to the geocoder.
    pub address: String,
    /// Geocode result, if the lookup succeeded.
    pub result: Option<GeocodeResult>,
    /// Failure description, if the lookup failed.
    pub error: Option<String>,
}

impl GeocodedBlock {
    /// Returns `true` if the block has usable coordinates.
    pub fn is_geocoded(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Coordinates of the block, if geocoded.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.result.as_ref().and_then(|r| r.coordinates().ok())
    }
}

/// The address sent to the geocoder for `block`.
///
/// # Examples
///
/// ```
/// use litter_core::BlockId;
/// use litter_pipeline::{address_for, LitterBlock};
///
/// let block = LitterBlock {
///     block_id: BlockId::new("1"),
///     hundred_block: "1200 MARKET ST".to_string(),
///     record: vec![],
/// };
/// assert_eq!(address_for(&block, ", Philadelphia, PA"), "1200 MARKET ST, Philadelphia, PA");
/// ```
pub fn address_for(block: &LitterBlock, suffix: &str) -> String {
    format!("{}{}", block.hundred_block.trim(), suffix)
}

/// Geocodes every block, preserving input order.
///
/// Blocks with a blank address fail validation without a request. Per-block
/// failures are recorded on the returned [`GeocodedBlock`] and the stage
/// carries on, unless `config.fail_fast` is set.
pub async fn geocode_blocks(
    geocoder: &dyn Geocoder,
    blocks: Vec<LitterBlock>,
    config: &PipelineConfig,
) -> Result<Vec<GeocodedBlock>> {
    let concurrency = config.geocode_concurrency.max(1);
    let suffix = config.address_suffix.as_str();

    let mut lookups = stream::iter(blocks.into_iter().map(move |block| async move {
        let address = address_for(&block, suffix);
        // A blank block would geocode to the bare city suffix.
        if block.hundred_block.trim().is_empty() {
            let message = format!("block {} has no address", block.block_id);
            return (block, address, Err(Error::validation_field("address", message)));
        }
        tracing::info!(block_id = %block.block_id, address = %address, "Geocoding block");
        let outcome = geocoder
            .geocode(&address)
            .await
            .and_then(|result| result.coordinates().map(|_| result));
        (block, address, outcome)
    }))
    .buffered(concurrency);

    let mut geocoded = Vec::new();
    while let Some((block, address, outcome)) = lookups.next().await {
        match outcome {
            Ok(result) => geocoded.push(GeocodedBlock {
                block,
                address,
                result: Some(result),
                error: None,
            }),
            Err(err) if config.fail_fast => return Err(err),
            Err(err) => {
                tracing::warn!(
                    block_id = %block.block_id,
                    address = %address,
                    error = %err,
                    "Geocoding failed"
                );
                geocoded.push(GeocodedBlock {
                    block,
                    address,
                    result: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    Ok(geocoded)
}
