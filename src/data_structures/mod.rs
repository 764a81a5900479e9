pub mod sequenced_heap;

pub use sequenced_heap::SequencedHeap;
