use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::tokens::Token;

/// Aliases every table starts from.
const BUILTIN: &[(&str, &str)] = &[
    // Containers
    ("bd", "Border"),
    ("dock", "DockPanel"),
    ("rel", "RelativePanel"),
    ("scroll", "ScrollViewer"),
    ("stack", "StackPanel"),
    ("uniform", "UniformPanel"),
    ("wrap", "WrapPanel"),
    ("grp", "GroupBox"),
    // Controls
    ("btn", "Button"),
    ("check", "CheckBox"),
    ("ci", "ComboBoxItem"),
    ("combo", "ComboBox"),
    ("cp", "ContentPresenter"),
    ("date", "DatePicker"),
    ("li", "ListBoxItem"),
    ("list", "ListBox"),
    ("mi", "MenuItem"),
    ("radio", "RadioButton"),
    ("rect", "Rectangle"),
    ("rtb", "RichTextBox"),
    ("rtf", "RichTextBox"),
    ("split", "GridSplitter"),
    ("tab", "TabItem"),
    ("tabs", "TabControl"),
    ("tb", "TextBlock"),
    ("ti", "TreeViewItem"),
    ("txt", "TextBox"),
    // Styling
    ("ct", "ControlTemplate"),
    ("set", "Setter"),
    ("setter", "Setter"),
    ("style", "Style"),
    ("trig", "Trigger"),
    ("trigger", "Trigger"),
    // Full control names
    ("border", "Border"),
    ("button", "Button"),
    ("calendar", "Calendar"),
    ("canvas", "Canvas"),
    ("checkbox", "CheckBox"),
    ("combobox", "ComboBox"),
    ("comboboxitem", "ComboBoxItem"),
    ("contentcontrol", "ContentControl"),
    ("datagrid", "DataGrid"),
    ("datepicker", "DatePicker"),
    ("dockpanel", "DockPanel"),
    ("documentviewer", "DocumentViewer"),
    ("ellipse", "Ellipse"),
    ("expander", "Expander"),
    ("frame", "Frame"),
    ("grid", "Grid"),
    ("gridsplitter", "GridSplitter"),
    ("groupbox", "GroupBox"),
    ("image", "Image"),
    ("label", "Label"),
    ("listbox", "ListBox"),
    ("listboxitem", "ListBoxItem"),
    ("listview", "ListView"),
    ("mediaelement", "MediaElement"),
    ("menu", "Menu"),
    ("menuitem", "MenuItem"),
    ("passwordbox", "PasswordBox"),
    ("progressbar", "ProgressBar"),
    ("radiobutton", "RadioButton"),
    ("rectangle", "Rectangle"),
    ("relativepanel", "RelativePanel"),
    ("richtextbox", "RichTextBox"),
    ("scrollbar", "ScrollBar"),
    ("scrollviewer", "ScrollViewer"),
    ("separator", "Separator"),
    ("slider", "Slider"),
    ("stackpanel", "StackPanel"),
    ("statusbar", "StatusBar"),
    ("tabcontrol", "TabControl"),
    ("textblock", "TextBlock"),
    ("textbox", "TextBox"),
    ("toggle", "ToggleButton"),
    ("toolbar", "ToolBar"),
    ("toolbarpanel", "ToolBarPanel"),
    ("toolbartray", "ToolBarTray"),
    ("treeview", "TreeView"),
    ("treeviewitem", "TreeViewItem"),
    ("viewbox", "Viewbox"),
    ("webbrowser", "WebBrowser"),
    ("windowsformshost", "WindowsFormsHost"),
    ("wrappanel", "WrapPanel"),
];

fn namespaced() -> &'static Regex {
    static NAMESPACED: OnceLock<Regex> = OnceLock::new();
    NAMESPACED.get_or_init(|| Regex::new(r"^\w+:\w+$").expect("Invalid namespace regex"))
}

/// Alias → element name lookup, read-only once built.
///
/// Keys are stored lowercase; lookups are case-insensitive and exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTable {
    entries: BTreeMap<String, String>,
}

impl ShortcutTable {
    /// A table with no aliases at all.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The stock alias table.
    pub fn builtin() -> Self {
        Self::from(builtin_map())
    }

    /// The stock table overlaid with caller aliases. A caller alias whose key
    /// is already present is ignored, as is any later duplicate.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ordered = BTreeMap::new();
        for (alias, name) in overrides {
            let alias: String = alias.into();
            ordered.entry(alias.to_lowercase()).or_insert_with(|| name.into());
        }
        Self::from(merge_shortcuts(&builtin_map(), &ordered))
    }

    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.entries.get(&alias.to_lowercase()).map(String::as_str)
    }

    /// Renames the token when its name is a known alias. Namespaced names
    /// (`prefix:Name`) are already canonical and pass through.
    pub fn resolve(&self, mut token: Token) -> Token {
        if token.name.is_empty() || namespaced().is_match(&token.name) {
            return token;
        }
        if let Some(name) = self.lookup(&token.name) {
            let name = name.to_string();
            token.rename(&name);
        }
        token
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Takes the mapping as the whole table; keys are lowercased and the first
/// key (in map order) of any case-insensitive collision is kept.
impl From<BTreeMap<String, String>> for ShortcutTable {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: merge_shortcuts(&entries, &BTreeMap::new()),
        }
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// First-write-wins merge: entries of `base` are never replaced. Keys come
/// out lowercased.
pub fn merge_shortcuts(
    base: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for (alias, name) in base.iter().chain(overrides) {
        merged
            .entry(alias.to_lowercase())
            .or_insert_with(|| name.clone());
    }
    merged
}

fn builtin_map() -> BTreeMap<String, String> {
    BUILTIN
        .iter()
        .map(|&(alias, name)| (alias.to_string(), name.to_string()))
        .collect()
}
