mod browse;
mod favorite;
mod helpers;
mod shopping;

pub(crate) use browse::{cmd_browse, cmd_search, cmd_show};
pub(crate) use favorite::{
    cmd_favorite_add, cmd_favorite_list, cmd_favorite_remove, cmd_favorite_toggle,
};
pub(crate) use helpers::parse_sort;
pub(crate) use shopping::{
    cmd_shopping_add, cmd_shopping_add_recipe, cmd_shopping_check, cmd_shopping_clear,
    cmd_shopping_clear_checked, cmd_shopping_export, cmd_shopping_list, cmd_shopping_remove,
};
