use xen_coding_engine::{ShortcutTable, expand};

fn expand_builtin(abbreviation: &str) -> String {
    expand(abbreviation, &ShortcutTable::builtin()).unwrap()
}

#[test]
fn snapshot_nested_multiplied_text() {
    insta::assert_snapshot!(expand_builtin("grid>stack>btn*3{item $}"), @r#"
    <Grid>
        <StackPanel>
            <Button>item 1</Button>
            <Button>item 2</Button>
            <Button>item 3</Button>
        </StackPanel>
    </Grid>
    "#);
}

#[test]
fn snapshot_menu_layout_with_climb() {
    insta::assert_snapshot!(
        expand_builtin("dock>menu>mi{File}+mi{Edit}^stack>tb.title{Hello}+txt#name"),
        @r#"
    <DockPanel>
        <Menu>
            <MenuItem>File</MenuItem>
            <MenuItem>Edit</MenuItem>
        </Menu>
        <StackPanel>
            <TextBlock Style="{DynamicResource title}">Hello</TextBlock>
            <TextBox x:Name="name" />
        </StackPanel>
    </DockPanel>
    "#
    );
}

#[test]
fn snapshot_style_setters() {
    insta::assert_snapshot!(expand_builtin("style>setter*2[Property=Margin$]"), @r#"
    <Style>
        <Setter Property="Margin1" Value="" />
        <Setter Property="Margin2" Value="" />
    </Style>
    "#);
}

#[test]
fn snapshot_padded_counter_under_multiplied_parent() {
    insta::assert_snapshot!(expand_builtin("list>li*3>tb{Row $$}"), @r#"
    <ListBox>
        <ListBoxItem>
            <TextBlock>Row 01</TextBlock>
        </ListBoxItem>
        <ListBoxItem>
            <TextBlock>Row 02</TextBlock>
        </ListBoxItem>
        <ListBoxItem>
            <TextBlock>Row 03</TextBlock>
        </ListBoxItem>
    </ListBox>
    "#);
}

#[test]
fn snapshot_binding_attribute() {
    insta::assert_snapshot!(
        expand_builtin("grid>tb[Text={Binding Name, Mode=OneWay}]"),
        @r#"
    <Grid>
        <TextBlock Text="{Binding Name, Mode=OneWay}" />
    </Grid>
    "#
    );
}

#[test]
fn snapshot_children_win_over_text() {
    insta::assert_snapshot!(expand_builtin("tabs>tab*2{Tab $}>grid"), @r"
    <TabControl>
        <TabItem>
            <Grid />
        </TabItem>
        <TabItem>
            <Grid />
        </TabItem>
    </TabControl>
    ");
}

#[test]
fn snapshot_climb_out_of_multiplied_element() {
    insta::assert_snapshot!(expand_builtin("stack>bd*2>tb^btn"), @r"
    <StackPanel>
        <Border>
            <TextBlock />
        </Border>
        <Border>
            <TextBlock />
        </Border>
        <Button />
    </StackPanel>
    ");
}

#[test]
fn snapshot_namespaced_root() {
    insta::assert_snapshot!(expand_builtin("local:MyControl>btn"), @r"
    <local:MyControl>
        <Button />
    </local:MyControl>
    ");
}
