use crate::{
    repository::Trip,
    shared::{MINUTES_PER_DAY, Minute},
};

const BUCKET_COUNT: usize = MINUTES_PER_DAY as usize;

/// Trip indexes grouped by minute of day.
///
/// All buckets share one flat buffer: bucket `m` is
/// `trips[offsets[m]..offsets[m + 1]]`, so a run of consecutive minutes is
/// one contiguous slice. Inside a bucket trips keep their load order.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    offsets: Box<[u32]>,
    trips: Box<[u32]>,
}

impl Default for MinuteBuckets {
    fn default() -> Self {
        Self {
            offsets: vec![0; BUCKET_COUNT + 1].into(),
            trips: Default::default(),
        }
    }
}

impl MinuteBuckets {
    /// Places every trip in the bucket of the minute returned by `minute_of`.
    /// Trips without a minute are left out of every bucket.
    pub fn build<F>(trips: &[Trip], minute_of: F) -> Self
    where
        F: Fn(&Trip) -> Option<Minute>,
    {
        let minutes: Vec<Option<Minute>> = trips.iter().map(minute_of).collect();

        let mut offsets = vec![0_u32; BUCKET_COUNT + 1];
        minutes
            .iter()
            .flatten()
            .for_each(|minute| offsets[minute.as_index() + 1] += 1);
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut cursor = offsets.clone();
        let mut bucketed = vec![0_u32; offsets[BUCKET_COUNT] as usize];
        minutes
            .into_iter()
            .enumerate()
            .filter_map(|(i, minute)| minute.map(|minute| (i as u32, minute)))
            .for_each(|(trip_idx, minute)| {
                let slot = &mut cursor[minute.as_index()];
                bucketed[*slot as usize] = trip_idx;
                *slot += 1;
            });

        Self {
            offsets: offsets.into(),
            trips: bucketed.into(),
        }
    }

    /// Trip indexes of a single minute.
    pub fn bucket(&self, minute: Minute) -> &[u32] {
        let i = minute.as_index();
        &self.trips[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Iterates the buckets in minute order.
    pub fn buckets(&self) -> impl Iterator<Item = (Minute, &[u32])> {
        (0..MINUTES_PER_DAY)
            .filter_map(Minute::new)
            .map(|minute| (minute, self.bucket(minute)))
    }

    /// Trip indexes for `len` consecutive minutes starting at `start`.
    /// Returns the part before midnight and the part after it.
    pub(crate) fn span(&self, start: Minute, len: u16) -> (&[u32], &[u32]) {
        let len = usize::from(len.min(MINUTES_PER_DAY));
        let start = start.as_index();
        let end = start + len;
        if end <= BUCKET_COUNT {
            (self.slice(start, end), &self.trips[..0])
        } else {
            (
                self.slice(start, BUCKET_COUNT),
                self.slice(0, end - BUCKET_COUNT),
            )
        }
    }

    /// Number of bucketed trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    fn slice(&self, from: usize, to: usize) -> &[u32] {
        &self.trips[self.offsets[from] as usize..self.offsets[to] as usize]
    }
}
