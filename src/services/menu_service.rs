use crate::{
    dto::menu::{CategoryList, MenuList, MenuQuery},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn list_menu(state: &AppState, query: MenuQuery) -> ApiResponse<MenuList> {
    let items: Vec<_> = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state.catalog.in_category(category).cloned().collect()
        }
        _ => state.catalog.items().to_vec(),
    };
    let meta = Meta::count(items.len());
    ApiResponse::success("Menu", MenuList { items }, Some(meta))
}

pub fn list_categories(state: &AppState) -> ApiResponse<CategoryList> {
    let categories: Vec<String> = state
        .catalog
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    let meta = Meta::count(categories.len());
    ApiResponse::success("Categories", CategoryList { categories }, Some(meta))
}
