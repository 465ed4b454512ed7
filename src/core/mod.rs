pub(crate) mod capability;
pub(crate) mod clock;
pub(crate) mod compact_list;
pub(crate) mod events;
pub(crate) mod existence_map;
pub(crate) mod identity;
pub(crate) mod lot;
pub(crate) mod provider;
pub(crate) mod spot;
