pub mod http;

/// Transport seam between the app and the network.
pub trait SendMessage<T, R> {
    fn send(&self, data: T) -> R;
}
