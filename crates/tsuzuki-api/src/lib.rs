//! AniList and Plex clients implementing the `tsuzuki-core` source traits.

pub mod anilist;
pub mod plex;
