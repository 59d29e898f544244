use crate::router::Route;

/// `CrediWise | [Dashboard]  Transactions  ...  | Logout`
pub fn render(active: Route) -> String {
    let links: Vec<String> = Route::NAV
        .iter()
        .map(|route| {
            if *route == active {
                format!("[{}]", route.title())
            } else {
                route.title().to_string()
            }
        })
        .collect();

    format!("CrediWise | {} | Logout", links.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_link_is_marked() {
        let bar = render(Route::Transactions);

        assert!(bar.starts_with("CrediWise | Dashboard  [Transactions]  Credit Education"));
        assert!(bar.ends_with("| Logout"));
    }
}
