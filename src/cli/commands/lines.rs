use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use crate::utils::table::Table;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut table = Table::new(&["LINE", "LEGS", "MACHINES"]);
    for (line, spec) in &cfg.lines.catalogue {
        table.add_row(vec![
            line.clone(),
            spec.legs.join(", "),
            spec.machines.join(", "),
        ]);
    }

    print!("{}", table.render());
    if !cfg.lines.enforce {
        warning("Catalogue is not enforced: any line/leg/machine is accepted");
    }
    Ok(())
}
