// Business domains
pub mod menus;
