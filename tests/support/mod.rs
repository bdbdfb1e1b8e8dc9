use intake::channel::InMemoryChannel;
use intake::duplicate::DuplicateCoordinator;
use intake::test_support::FakeWorker;
use std::sync::Arc;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[allow(dead_code)]
/// In-memory channel with a coordinator and a fake worker attached to it
pub fn coordinator_with_worker() -> (InMemoryChannel, DuplicateCoordinator, FakeWorker) {
    let channel = InMemoryChannel::new(tokio::runtime::Handle::current());
    let worker = FakeWorker::attach(&channel);
    let coordinator = DuplicateCoordinator::attach(
        Arc::new(channel.clone()),
        tokio::runtime::Handle::current(),
    );
    (channel, coordinator, worker)
}
