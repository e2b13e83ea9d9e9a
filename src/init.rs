use crate::factory::LoggerFactory;
use crate::layer::DispatchLayer;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Route every `tracing` event in the process into `factory`'s sinks.
///
/// **Parameters**
/// - `factory`: the [`LoggerFactory`] whose dispatch chain receives the
///   converted events.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`DispatchLayer`] as the global
/// default subscriber. Events keep flowing to the chain even after the
/// factory is dropped, since the layer holds its own reference.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing(factory: &LoggerFactory) -> Result<(), SetGlobalDefaultError> {
    let subscriber = Registry::default().with(DispatchLayer::new(factory.dispatcher()));
    tracing::subscriber::set_global_default(subscriber)
}
