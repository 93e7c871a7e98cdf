use super::{Bitset, Counter, Tally, ADDRESS_SPACE};
use crate::{Error, ParserKind};
use log::{info, trace};
use std::{
    io::{BufRead, Read},
    sync::{
        mpsc::{self, SyncSender},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
};

/// The address space is split on its low bits, one mutex per shard, so
/// neighbouring addresses land on different locks.
pub const SHARD_BITS: u32 = 12;
pub const SHARDS: usize = 1 << SHARD_BITS;
const SHARD_SPACE: u64 = ADDRESS_SPACE >> SHARD_BITS;

pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Chunks in flight across all workers before reading blocks.
pub const CHUNK_QUEUE_LEN: usize = 128;

/// Bitset over the whole address space, split into independently locked shards.
pub struct ShardedBitset {
    shards: Vec<Mutex<Bitset>>,
}

impl Default for ShardedBitset {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardedBitset {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARDS)
                .map(|_| Mutex::new(Bitset::with_bits(SHARD_SPACE)))
                .collect(),
        }
    }

    pub fn shard_of(address: u32) -> usize {
        address as usize % SHARDS
    }

    pub fn insert(&self, address: u32) -> bool {
        let shard = Self::shard_of(address);
        let bit = address >> SHARD_BITS;

        // A poisoned shard still holds valid bits, the panicking worker is
        // reported on join
        let mut bits = self.shards[shard]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        bits.insert(bit)
    }
}

/// Spreads the input over worker threads that share a [`ShardedBitset`].
///
/// The reader is cut into chunks of roughly `chunk_size` bytes, always ending
/// on a line boundary, and handed out round-robin.
pub struct ConcurrentCounter {
    seen: Arc<ShardedBitset>,
    parser: ParserKind,
    workers: usize,
    chunk_size: usize,
}

impl ConcurrentCounter {
    pub fn new(parser: ParserKind, workers: usize, chunk_size: usize) -> Self {
        Self {
            seen: Arc::new(ShardedBitset::new()),
            parser,
            workers: workers.max(1),
            chunk_size: chunk_size.max(1),
        }
    }

    fn spawn_workers(&self) -> (Vec<SyncSender<Vec<u8>>>, Vec<JoinHandle<Tally>>) {
        let mut senders = Vec::with_capacity(self.workers);
        let mut handles = Vec::with_capacity(self.workers);
        let depth = (CHUNK_QUEUE_LEN / self.workers).max(1);

        for id in 0..self.workers {
            let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(depth);
            let seen = Arc::clone(&self.seen);
            let parser = self.parser;

            let handle = thread::spawn(move || {
                let mut tally = Tally::default();

                for chunk in rx {
                    for line in chunk.split(|&b| b == b'\n') {
                        tally.record(line, parser, |address| seen.insert(address));
                    }
                }

                trace!("worker {} done: {:?}", id, tally);
                tally
            });

            senders.push(tx);
            handles.push(handle);
        }

        (senders, handles)
    }
}

impl Counter for ConcurrentCounter {
    fn count(&mut self, reader: &mut dyn BufRead) -> Result<Tally, Error> {
        let (senders, handles) = self.spawn_workers();
        info!("started {} workers", self.workers);

        let dispatched = dispatch(reader, &senders, self.chunk_size);

        // Closing the channels lets the workers drain and exit
        drop(senders);

        let mut total = Tally::default();
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(tally) => total += tally,
                Err(_) => return Err(Error::WorkerPanicked(id)),
            }
        }

        let chunks = dispatched?;
        info!("counted {} chunks: {:?}", chunks, total);

        Ok(total)
    }
}

fn dispatch(
    reader: &mut dyn BufRead,
    senders: &[SyncSender<Vec<u8>>],
    chunk_size: usize,
) -> Result<usize, Error> {
    let mut chunks = 0;

    loop {
        let mut chunk = Vec::with_capacity(chunk_size);
        let read = Read::take(&mut *reader, chunk_size as u64).read_to_end(&mut chunk)?;
        if read == 0 {
            break;
        }

        // Finish the line that straddles the chunk boundary
        if chunk.last() != Some(&b'\n') {
            reader.read_until(b'\n', &mut chunk)?;
        }

        let worker = chunks % senders.len();
        trace!("chunk {} ({} bytes) -> worker {}", chunks, chunk.len(), worker);

        senders[worker]
            .send(chunk)
            .map_err(|_| Error::WorkerGone(worker))?;
        chunks += 1;
    }

    Ok(chunks)
}
