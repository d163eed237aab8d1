pub(super) const ROOT_LONG_ABOUT: &str = "\
Record checksums of individual files and watch them for changes

Fileward keeps a baseline of SHA-256 checksums for a hand-picked set of files
(for example system configuration) and reports, on demand or continuously,
whether each of them is unchanged, modified, missing or unreadable.

CORE CONCEPTS:

  Baseline:
    A JSON object mapping each tracked path to the SHA-256 checksum of its
    content, stored in .fileward.json in the working directory by default
    (see --baseline). Paths are stored exactly as given on the command line
    and are resolved relative to the working directory.

  Statuses:
    .  unchanged    content matches the baseline
    M  modified     content differs from the baseline
    D  missing      the file no longer exists
    E  unreadable   the file exists but could not be read

TYPICAL WORKFLOW:

  1. Record a baseline:
     $ fileward init /etc/hosts /etc/passwd

  2. Check it later:
     $ fileward check

  3. Accept an intended change:
     $ fileward add /etc/hosts

  4. Keep a live view open:
     $ fileward watch

EXIT CODES:

  0    Success, no differences found
  1    check found modified, missing or unreadable files
  255  Any error (corrupt baseline, I/O failure, invalid arguments)
";

pub(super) const INIT_LONG_ABOUT: &str = "\
Replace the baseline with checksums of the given files

Any existing baseline is discarded, even if it is corrupt. Paths that do not
exist are skipped with a warning; use --strict to fail instead. If any file
cannot be read, nothing is written.
";

pub(super) const ADD_LONG_ABOUT: &str = "\
Track additional files, or re-baseline files that are already tracked

New paths are appended to the baseline. Paths that are already tracked are
checksummed again, which accepts their current content as the new baseline.
Paths that do not exist are skipped with a warning; use --strict to fail
instead.
";

pub(super) const CHECK_LONG_ABOUT: &str = "\
Compare tracked files against the baseline once

Every tracked file is checksummed again. By default only files that are not
unchanged are listed; --all lists everything and --json prints a JSON array
of {\"file\", \"status\"} objects for every tracked file.

A corrupt baseline file is an error and is never treated as empty.
";

pub(super) const WATCH_LONG_ABOUT: &str = "\
Re-check tracked files continuously until interrupted

The baseline is reloaded on every check, so changes made with add, remove or
init from another shell show up on the next refresh. A failing check (for
example a corrupt baseline file) is shown in place of the results and the
watch continues. Press Ctrl-C to stop.
";
