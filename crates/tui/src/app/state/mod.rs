pub(crate) mod banner;
pub(crate) mod records;

pub(crate) use banner::{Banner, BannerTone, NotificationService};
pub(crate) use records::{EntityKind, Record, RecordStore, RecordsScreen};
