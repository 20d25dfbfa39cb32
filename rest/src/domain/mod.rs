//! Domain logic over the YouTube catalog: mapping, paging, channel lookup and
//! the subscription feed

pub mod channels;
pub mod feed;
pub mod mappers;
pub mod paging;

#[cfg(test)]
pub mod testing;
