use std::{fs::File, io::BufReader, path::Path};

use waymark_navigation::view::NavigationProps;

pub fn read_props(path: &Path) -> anyhow::Result<NavigationProps> {
    let file = File::open(path)
        .map_err(|err| anyhow::anyhow!("Cannot open {}: {}", path.display(), err))?;
    let props: NavigationProps = serde_json::from_reader(BufReader::new(file))?;

    Ok(props)
}
