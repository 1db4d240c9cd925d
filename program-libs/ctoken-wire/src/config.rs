/// Protocol parameters for rent-prepaid compressible accounts.
///
/// Builders take this explicitly instead of reading global constants so tests
/// and alternative deployments can override the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Minimum number of epochs a compressible account must prepay.
    pub min_rent_epochs: u16,
    /// Slots per rent epoch.
    pub slots_per_epoch: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            min_rent_epochs: 2,
            slots_per_epoch: 432_000,
        }
    }
}
