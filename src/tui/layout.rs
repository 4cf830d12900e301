use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub header_area: Rect,
    pub stats_area: Rect,
    pub filters_area: Rect,
    pub list_area: Rect,
    pub pagination_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: 40 columns keeps the three stat cards readable side by side
    /// Height: 14 lines (2 outer borders + 1 header + 3 stats + 3 filters
    /// + 3 list + 1 pagination + 1 status)
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 14;

    pub fn calculate(size: Rect) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        // Inner area accounts for the outer border: 1 char on each side
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(3), // Stats cards
                Constraint::Length(3), // Filter summary (borders + content)
                Constraint::Min(1),    // Task list / form
                Constraint::Length(1), // Pagination
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            header_area: vertical[0],
            stats_area: vertical[1],
            filters_area: vertical[2],
            list_area: vertical[3],
            pagination_area: vertical[4],
            status_area: vertical[5],
        }
    }
}
