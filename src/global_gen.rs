//! Process-wide generators and entry point functions.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::{clock, node, ClockSequence, NodeId, Uuid};
use inner::GlobalGenInner;

type GlobalGen = OnceLock<Mutex<GlobalGenInner>>;

/// The generator behind [`uuid7()`]; it sleeps with the lock held when its counter wraps.
static V7_GEN: GlobalGen = OnceLock::new();

/// The generator behind [`uuid4()`], so that it never waits on a UUIDv7 counter wrap.
static V4_GEN: GlobalGen = OnceLock::new();

/// Returns the lock handle of a process-wide generator, creating one if none exists.
fn lock_global_gen(g: &'static GlobalGen) -> MutexGuard<'static, GlobalGenInner> {
    g.get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The clock sequence shared by all UUIDv1 entry points.
static CLOCK_SEQUENCE: ClockSequence = ClockSequence::new();

/// Generates a UUIDv7 object.
///
/// This function employs a global generator and guarantees the process-wide uniqueness and, while
/// the system clock does not move backwards, the increasing order of UUIDs. On Unix, this
/// function resets the generator when the process ID changes (i.e., upon process forks) to
/// prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let uuid = uniqid::uuid7();
/// println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uniqid::uuid7().to_string();
/// ```
pub fn uuid7() -> Uuid {
    lock_global_gen(&V7_GEN).get_mut().generate()
}

/// Generates a UUIDv4 object.
///
/// # Examples
///
/// ```rust
/// let uuid = uniqid::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    lock_global_gen(&V4_GEN).get_mut().generate_v4()
}

/// Generates a UUIDv1 object embedding the process-wide node id.
///
/// # Examples
///
/// ```rust
/// let uuid = uniqid::uuid1();
/// assert_eq!(uuid.version(), Some(1));
/// let (_, _, node) = uuid.v1_fields().unwrap();
/// assert_eq!(node, uniqid::node_id().as_u64());
/// ```
pub fn uuid1() -> Uuid {
    uuid1_with_node(node::node_id())
}

/// Generates a UUIDv1 object embedding the process-wide random node id instead of a hardware
/// address.
pub fn uuid1_anonymous() -> Uuid {
    uuid1_with_node(node::dummy_node_id())
}

/// Generates a UUIDv1 object embedding `node`.
///
/// Calls from every thread share one clock sequence, so two calls observing the same (or an
/// earlier) timestamp still produce distinct identifiers.
pub fn uuid1_with_node(node: NodeId) -> Uuid {
    let ticks = clock::gregorian_ticks() & ((1 << 60) - 1);
    let clock_seq = CLOCK_SEQUENCE.next(ticks);
    Uuid::from_fields_v1(ticks, clock_seq, node.as_u64())
}

mod inner {
    use crate::{rng::GlobalRng, V7Generator};

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: V7Generator<GlobalRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V7Generator::new(GlobalRng::new()),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`V7Generator`] instance, reseting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut V7Generator<GlobalRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}
