pub mod click_log;
pub mod short_link;

pub use click_log::Entity as ClickLogEntity;
pub use short_link::Entity as ShortLinkEntity;
