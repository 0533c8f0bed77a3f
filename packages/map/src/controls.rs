//! The crime-type and municipality selectors.

/// The two selectors next to the map.
///
/// Options are plain labels. The first municipality option is always the
/// whole-region sentinel.
pub trait FilterControls {
    /// Crime types offered by the crime selector, in display order.
    fn crime_type_options(&self) -> Vec<String>;

    /// Crime type currently selected, if the selector has a selection.
    fn selected_crime_type(&self) -> Option<String>;

    /// Replaces the municipality selector's options.
    fn set_municipality_options(&mut self, options: &[String]);

    /// Moves the municipality selector to `option` without firing a change
    /// event.
    fn set_selected_municipality(&mut self, option: &str);
}
